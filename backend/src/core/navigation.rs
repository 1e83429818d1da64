use crate::core::models::PhotoId;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    List,
    Detail(PhotoId),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid image ID: {0:?}")]
pub struct InvalidRoute(pub String);

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Detail(id) => format!("/photos/{id}"),
        }
    }

    /// Parses the `{id}` segment of a detail route.
    pub fn parse_detail(segment: &str) -> Result<PhotoId, InvalidRoute> {
        match segment.trim().parse::<PhotoId>() {
            Ok(id) if id >= 0 => Ok(id),
            _ => Err(InvalidRoute(segment.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::List.path(), "/");
        assert_eq!(Route::Detail(42).path(), "/photos/42");
    }

    #[test]
    fn test_parse_detail_accepts_integer() {
        assert_eq!(Route::parse_detail("17"), Ok(17));
    }

    #[test]
    fn test_parse_detail_rejects_garbage_and_negative() {
        assert!(Route::parse_detail("abc").is_err());
        assert!(Route::parse_detail("").is_err());
        assert!(Route::parse_detail("-1").is_err());
    }
}
