use tracing::debug;

use crate::common::error::NoMatchError;
use crate::engine::NodeHandle;

/// Nodes found by a selector cascade and the candidate that found them
#[derive(Debug, Clone)]
pub struct Resolution<N> {
    pub nodes: Vec<N>,
    pub selector: String,
}

/// Tries candidate selectors in order; the first one matching anything wins.
///
/// There is no scoring and no merging: later candidates are never evaluated
/// once an earlier one has matched.
pub fn resolve<N, S>(context: &N, candidates: &[S]) -> Result<Resolution<N>, NoMatchError>
where
    N: NodeHandle,
    S: AsRef<str>,
{
    for candidate in candidates {
        let selector = candidate.as_ref();
        let nodes = context.query_all(selector);
        if !nodes.is_empty() {
            debug!("Selector '{}' matched {} node(s)", selector, nodes.len());
            return Ok(Resolution {
                nodes,
                selector: selector.to_string(),
            });
        }
        debug!("Selector '{}' matched nothing, trying next candidate", selector);
    }

    Err(NoMatchError {
        candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// In-memory node answering queries from a fixed table and logging them
    #[derive(Debug, Clone, Default)]
    pub struct FakeNode {
        pub text: String,
        pub attributes: HashMap<String, String>,
        pub children: HashMap<String, Vec<FakeNode>>,
        pub queries: Rc<RefCell<Vec<String>>>,
    }

    impl FakeNode {
        pub fn text(text: &str) -> Self {
            Self {
                text: text.to_string(),
                ..Default::default()
            }
        }

        pub fn with_child(mut self, selector: &str, nodes: Vec<FakeNode>) -> Self {
            self.children.insert(selector.to_string(), nodes);
            self
        }

        pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
            self.attributes.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl NodeHandle for FakeNode {
        fn query_all(&self, selector: &str) -> Vec<Self> {
            self.queries.borrow_mut().push(selector.to_string());
            self.children.get(selector).cloned().unwrap_or_default()
        }

        fn inner_text(&self) -> String {
            self.text.clone()
        }

        fn attribute(&self, name: &str) -> Option<String> {
            self.attributes.get(name).cloned()
        }
    }

    #[test]
    fn test_first_non_empty_candidate_wins() {
        let page = FakeNode::default()
            .with_child("S2", vec![FakeNode::text("a"), FakeNode::text("b")])
            .with_child("S3", vec![FakeNode::text("c")]);

        let resolution = resolve(&page, &["S1", "S2", "S3"]).unwrap();
        assert_eq!(resolution.selector, "S2");
        assert_eq!(resolution.nodes.len(), 2);
        // S3 is never evaluated
        assert_eq!(*page.queries.borrow(), vec!["S1", "S2"]);
    }

    #[test]
    fn test_no_candidate_matches() {
        let page = FakeNode::default();
        let err = resolve(&page, &["[data-project-id]", ".JobCard"]).unwrap_err();
        assert_eq!(err.candidates, vec!["[data-project-id]", ".JobCard"]);
    }

    #[test]
    fn test_empty_candidate_list_is_no_match() {
        let page = FakeNode::default();
        let candidates: Vec<String> = Vec::new();
        let err = resolve(&page, &candidates).unwrap_err();
        assert!(err.candidates.is_empty());
    }
}
