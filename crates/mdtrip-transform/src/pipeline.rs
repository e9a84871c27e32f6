//! Transformer pipeline
//!
//! Passes run in registration order over a mutable document. The tree is
//! validated before the first pass and after every pass, so a transformer
//! that breaks a structural invariant is caught immediately and named in
//! the error rather than surfacing later as garbled output.

use tracing::debug;

use mdtrip_core::{validate_tree, ExtensionSet, MdtripError, Node, Result};

/// One document-rewriting pass
pub trait Transform {
    fn name(&self) -> &str;

    fn apply(&self, doc: &mut Node) -> Result<()>;
}

/// An ordered sequence of transforms
#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pass: Box<dyn Transform>) {
        self.passes.push(pass);
    }

    pub fn with(mut self, pass: Box<dyn Transform>) -> Self {
        self.push(pass);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass in order, validating between passes
    pub fn run(&self, doc: &mut Node) -> Result<()> {
        validate_tree(doc)?;
        for pass in &self.passes {
            debug!(pass = pass.name(), "running transform pass");
            pass.apply(doc)?;
            validate_tree(doc).map_err(|err| match err {
                MdtripError::Validation { kind, message } => MdtripError::Validation {
                    kind,
                    message: format!("after pass '{}': {message}", pass.name()),
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Adapter running every registered extension's transform hook as a
/// single pipeline pass, in extension priority order.
pub struct ExtensionPass {
    extensions: ExtensionSet,
}

impl ExtensionPass {
    pub fn new(extensions: ExtensionSet) -> Self {
        Self { extensions }
    }
}

impl Transform for ExtensionPass {
    fn name(&self) -> &str {
        "extensions"
    }

    fn apply(&self, doc: &mut Node) -> Result<()> {
        for extension in self.extensions.iter() {
            debug!(extension = extension.name(), "running extension transform");
            extension.transform(doc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdtrip_core::NodeKind;

    struct Uppercase;

    impl Transform for Uppercase {
        fn name(&self) -> &str {
            "uppercase"
        }

        fn apply(&self, doc: &mut Node) -> Result<()> {
            doc.walk_mut(&mut |node| {
                if *node.kind() == NodeKind::Text {
                    if let Some(text) = node.text_content() {
                        let upper = text.to_uppercase();
                        if upper != text {
                            node.set_text(upper);
                        }
                    }
                }
            });
            Ok(())
        }
    }

    struct Breaker;

    impl Transform for Breaker {
        fn name(&self) -> &str {
            "breaker"
        }

        fn apply(&self, doc: &mut Node) -> Result<()> {
            // push a bare inline at document level
            doc.push_child(Node::text("oops"));
            Ok(())
        }
    }

    fn doc() -> Node {
        Node::document().with_child(Node::paragraph().with_child(Node::text("hello")))
    }

    #[test]
    fn test_passes_run_in_order() {
        let mut tree = doc();
        let pipeline = Pipeline::new().with(Box::new(Uppercase));
        pipeline.run(&mut tree).unwrap();
        assert_eq!(tree.collect_text(), "HELLO");
    }

    #[test]
    fn test_invalid_output_names_the_pass() {
        let mut tree = doc();
        let pipeline = Pipeline::new().with(Box::new(Breaker));
        let err = pipeline.run(&mut tree).unwrap_err();
        assert!(err.to_string().contains("after pass 'breaker'"), "{err}");
    }

    #[test]
    fn test_input_is_validated_before_first_pass() {
        let mut not_a_doc = Node::paragraph();
        let pipeline = Pipeline::new().with(Box::new(Uppercase));
        assert!(pipeline.run(&mut not_a_doc).is_err());
    }
}
