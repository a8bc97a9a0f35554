use crate::common::error::PjError;

/// pj全体で使用するResult型のエイリアス
pub type PjResult<T> = Result<T, PjError>;

/// Optionのエラー変換ヘルパー
pub trait OptionExt<T> {
    /// NoneをInternalErrorに変換する
    ///
    /// # Examples
    ///
    /// ```
    /// use pj::common::result::{OptionExt, PjResult};
    ///
    /// let none_value: Option<String> = None;
    /// let result: PjResult<String> = none_value.ok_or_internal_error("Value not found");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_internal_error(self, message: impl Into<String>) -> PjResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_internal_error(self, message: impl Into<String>) -> PjResult<T> {
        self.ok_or_else(|| PjError::internal_error(message))
    }
}

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T> {
    /// io::ErrorをFileSystemErrorに変換する（パス付き）
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> PjResult<T>;
}

impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> PjResult<T> {
        self.map_err(|e| PjError::filesystem_error_with_source(message, path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_option_ext_ok_or_internal_error() {
        let none_value: Option<String> = None;
        let result = none_value.ok_or_internal_error("test error");

        if let Err(PjError::InternalError { message, .. }) = result {
            assert_eq!(message, "test error");
        } else {
            panic!("Expected InternalError");
        }

        assert_eq!(Some(3).ok_or_internal_error("unused").unwrap(), 3);
    }

    #[test]
    fn test_result_ext_with_filesystem_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<String, std::io::Error> = Err(io_error);
        let path = Some(PathBuf::from("/test/path"));

        match result.with_filesystem_error("read", path.clone()) {
            Err(PjError::FileSystemError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected FileSystemError, got {:?}", other),
        }
    }
}
