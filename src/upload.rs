//! 单文件 multipart 上传处理器。

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Extension, Multipart};
use axum::http::{HeaderMap, header};
use axum::response::Json as JsonResponse;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::UPLOAD_FIELD;
use crate::error::ApiError;
use crate::storage::{Storage, public_path, stored_name};

pub const NO_FILE_MESSAGE: &str = "No file selected";
pub const UNEXPECTED_FIELD_MESSAGE: &str = "Unexpected field";

#[derive(Serialize)]
pub(crate) struct UploadResponse {
    message: &'static str,
    file: String,
}

struct StoredUpload {
    name: String,
    size: u64,
}

/// 接收 `myfile` 字段并以 `{毫秒时间戳}-{原文件名}` 写入上传目录。
pub async fn upload_file(
    headers: HeaderMap,
    Extension(storage): Extension<Arc<Storage>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<JsonResponse<UploadResponse>, ApiError> {
    if !is_multipart_form(&headers) {
        return Err(ApiError::BadRequest(NO_FILE_MESSAGE.into()));
    }
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "multipart rejected");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let mut stored: Option<StoredUpload> = None;
    let receive_result: Result<(), ApiError> = async {
        while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(original) = field
                .file_name()
                .filter(|name| !name.is_empty())
                .map(str::to_string)
            else {
                continue;
            };
            if field.name() != Some(UPLOAD_FIELD) || stored.is_some() {
                return Err(ApiError::BadRequest(UNEXPECTED_FIELD_MESSAGE.into()));
            }

            let name = stored_name(Utc::now().timestamp_millis(), &original);
            let mut file = storage.create_file(&name).await?;
            let upload = stored.insert(StoredUpload { name, size: 0 });
            while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                file.write_all(&chunk)
                    .await
                    .map_err(|err| ApiError::BadRequest(err.to_string()))?;
                upload.size += chunk.len() as u64;
            }
            file.flush()
                .await
                .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        }
        Ok(())
    }
    .await;

    if let Err(err) = receive_result {
        if let Some(upload) = &stored {
            storage.remove_file(&upload.name).await;
        }
        warn!(error = err.message(), "upload failed");
        return Err(err);
    }

    let Some(upload) = stored else {
        return Err(ApiError::BadRequest(NO_FILE_MESSAGE.into()));
    };
    info!(name = upload.name, size = upload.size, "file uploaded");
    Ok(JsonResponse(UploadResponse {
        message: "File uploaded successfully",
        file: public_path(&upload.name),
    }))
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::BadRequest(err.body_text())
}

/// 非 multipart 请求视为未携带文件。
fn is_multipart_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}
