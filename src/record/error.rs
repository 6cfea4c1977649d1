use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read records: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in record {record}: {source}")]
    Json {
        record: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {record} is not a JSON object")]
    NotAnObject { record: usize },

    #[error("Record {record} has no value for id field '{field}'")]
    MissingId { record: usize, field: String },
}
