//! 上传目录列表处理器。

use axum::extract::Extension;
use axum::response::Json as JsonResponse;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::ApiError;
use crate::storage::{Storage, StorageError};

pub const LIST_ERROR_MESSAGE: &str = "Error reading uploads directory";

#[derive(Serialize)]
pub(crate) struct FileList {
    files: Vec<String>,
}

/// 列出上传目录中的非隐藏文件名。
pub async fn list_files(
    Extension(storage): Extension<Arc<Storage>>,
) -> Result<JsonResponse<FileList>, ApiError> {
    let files = storage.list_names().await.map_err(|StorageError::Io(err)| {
        error!(
            path = ?storage.root_path(),
            error = %err,
            "failed to read upload directory"
        );
        ApiError::Internal(LIST_ERROR_MESSAGE.into())
    })?;
    info!(count = files.len(), "list files");
    Ok(JsonResponse(FileList { files }))
}
