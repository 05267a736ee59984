//! A filter that stamps one annotation onto every resource.
//!
//! Used by the surrounding package tool to record provenance (which package
//! a resource came from) as it flows through a pipeline.

use crate::errors::Result;
use crate::filters::Filter;
use crate::resource::Resource;

/// Sets a fixed key/value annotation on every node, preserving sequence
/// order. Existing values under the same key are overwritten in place.
#[derive(Debug, Clone)]
pub struct SetAnnotation {
    key: String,
    value: String,
}

impl SetAnnotation {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Filter for SetAnnotation {
    fn name(&self) -> &str {
        "SetAnnotation"
    }

    fn filter(&self, mut resources: Vec<Resource>) -> Result<Vec<Resource>> {
        for resource in &mut resources {
            resource.set_annotation(&self.key, &self.value);
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_annotation_on_every_node_in_order() {
        let input = vec![
            Resource::parse("metadata:\n  name: a\n").unwrap(),
            Resource::parse("metadata:\n  name: b\n").unwrap(),
        ];
        let out = SetAnnotation::new("pkg", "hello-world")
            .filter(input)
            .unwrap();
        let names: Vec<&str> = out.iter().map(Resource::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        for r in &out {
            assert_eq!(r.annotation("pkg"), Some("hello-world".to_string()));
        }
    }
}
