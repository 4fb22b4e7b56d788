use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_error)
}

fn into_error(err: serde_path_to_error::Error<serde_json::Error>) -> Error {
    let path = err.path().to_string();
    Error::Deserialize { path, message: err.into_inner().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::cases::CaseFile;

    #[test]
    fn error_names_the_failing_field() {
        let src = r#"{"blocks": [{"name": 5, "cases": []}]}"#;
        let err = from_str_with_path::<CaseFile>(src).unwrap_err();
        let Error::Deserialize { path, message } = err else { panic!("expected deserialize error") };
        assert_eq!(path, "blocks[0].name");
        assert!(message.contains("invalid type"), "{message}");
    }
}
