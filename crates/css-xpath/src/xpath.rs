//! XPath expression builder
//!
//! An expression is kept as three parts, `path` + `element` + `[condition]`,
//! so that combinators can append a step and simple selectors can narrow the
//! last step without reparsing anything.

use std::fmt;

use xpath_escaper::escape_literal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathExpr {
    path: String,
    element: String,
    condition: String,
}

impl XPathExpr {
    pub fn new(
        path: impl Into<String>,
        element: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            element: element.into(),
            condition: condition.into(),
        }
    }

    /// Expression matching any element
    pub fn any() -> Self {
        Self::new("", "*", "")
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// ANDs `condition` onto the last step
    pub fn add_condition(&mut self, condition: impl AsRef<str>) -> &mut Self {
        let condition = condition.as_ref();
        self.condition = if self.condition.is_empty() {
            condition.to_string()
        } else {
            format!("({}) and ({})", self.condition, condition)
        };
        self
    }

    /// Moves the element name into the condition so the step becomes `*`
    pub fn add_name_test(&mut self) -> &mut Self {
        if self.element != "*" {
            let test = format!("name() = {}", escape_literal(&self.element));
            self.add_condition(test);
            self.element = "*".to_string();
        }
        self
    }

    /// Appends `other` as a new step, separated by `combiner`
    pub fn join(self, combiner: &str, other: XPathExpr) -> XPathExpr {
        XPathExpr {
            path: format!("{self}{combiner}{}", other.path),
            element: other.element,
            condition: other.condition,
        }
    }
}

impl fmt::Display for XPathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.element)?;
        if !self.condition.is_empty() {
            write!(f, "[{}]", self.condition)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_nest() {
        let mut expr = XPathExpr::new("", "a", "");
        expr.add_condition("@href").add_condition("@title");
        assert_eq!(expr.to_string(), "a[(@href) and (@title)]");
    }

    #[test]
    fn test_name_test() {
        let mut expr = XPathExpr::new("", "li", "");
        expr.add_name_test().add_condition("position() = 1");
        assert_eq!(
            expr.to_string(),
            "*[(name() = 'li') and (position() = 1)]"
        );

        let mut any = XPathExpr::any();
        any.add_name_test();
        assert_eq!(any.to_string(), "*");
    }

    #[test]
    fn test_join() {
        let left = XPathExpr::new("", "ul", "@id = 'nav'");
        let right = XPathExpr::new("", "li", "");
        assert_eq!(left.join("/", right).to_string(), "ul[@id = 'nav']/li");
    }
}
