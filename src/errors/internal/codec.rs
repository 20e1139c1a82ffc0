use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON conversion failed: {source}")]
    Unserializable {
        #[source]
        source: serde_json::Error,
    },

    #[error("State does not serialize to an object: got {got}")]
    NotAnObject { got: &'static str },
}
