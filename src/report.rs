use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use {serde::Serialize, tabled::Tabled};

/// Per-node index value, labeled with the name it was requested by
#[cfg_attr(feature = "serde", derive(Serialize, Tabled))]
#[derive(Debug, Clone, PartialEq)]
pub struct NodeValue {
    pub node: String,
    pub value: f64,
}

impl NodeValue {
    pub fn new(node: String, value: f64) -> Self {
        NodeValue { node, value }
    }
}

/// `name<TAB>value`, with the value in shortest round-trip form
impl Display for NodeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.node, self.value)
    }
}

/// Pair requested names with computed values, keeping request order
pub fn node_values<S: AsRef<str>>(names: &[S], values: Vec<f64>) -> Vec<NodeValue> {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| NodeValue::new(name.as_ref().to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_tab_and_full_precision() {
        let row = NodeValue::new("1".to_string(), 0.1 / 3.0);
        assert_eq!(row.to_string(), "1\t0.03333333333333333");

        let row = NodeValue::new("4".to_string(), 0.95);
        assert_eq!(row.to_string(), "4\t0.95");
    }

    #[test]
    fn test_node_values_keep_order() {
        let rows = node_values(&["b", "a"], vec![2.0, 1.0]);
        assert_eq!(rows[0], NodeValue::new("b".to_string(), 2.0));
        assert_eq!(rows[1], NodeValue::new("a".to_string(), 1.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_rendering() {
        let rows = node_values(&["5"], vec![0.25]);
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(json, r#"[{"node":"5","value":0.25}]"#);
    }
}
