//! Question answering endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use std::sync::Arc;
use uuid::Uuid;

use innsight_core::Error;

use crate::server::types::{ApiError, AskRequest, AskResponse, BaseResponse, SourcePassage};
use crate::startup::AppState;

type AskRejection = (StatusCode, Json<BaseResponse<()>>);

/// POST /ask - Answer a question grounded in retrieved analytics passages
pub async fn ask(
  State(state): State<Arc<AppState>>,
  Json(request): Json<AskRequest>,
) -> Result<Json<BaseResponse<AskResponse>>, AskRejection> {
  let transaction_id = Uuid::new_v4();

  let question = request.question.trim();
  if question.is_empty() {
    return Err(reject(
      StatusCode::BAD_REQUEST,
      "empty_question",
      "Question must not be empty",
      transaction_id,
    ));
  }

  tracing::debug!(%transaction_id, question, "answering question");
  match state.engine.answer(question).await {
    Ok(result) => {
      if let Some(history) = &state.history {
        // History is an audit convenience; a failed append never fails the request
        if let Err(e) = history.append(&result.question, &result.answer).await {
          tracing::warn!(%transaction_id, error = %e, "failed to append query history");
        }
      }

      let sources = if request.include_sources {
        result.sources.iter().map(SourcePassage::from).collect()
      } else {
        Vec::new()
      };
      let response = AskResponse { answer: result.answer, sources };
      Ok(Json(BaseResponse::success(response, transaction_id)))
    }
    Err(Error::NotInitialized) => Err(reject(
      StatusCode::SERVICE_UNAVAILABLE,
      "not_ready",
      "The semantic index is not ready yet",
      transaction_id,
    )),
    Err(Error::Generation(e)) => {
      tracing::error!(%transaction_id, error = %e, "generation failed");
      Err(reject(
        StatusCode::BAD_GATEWAY,
        "generation_failed",
        "The generation service did not produce an answer",
        transaction_id,
      ))
    }
    Err(e) => {
      tracing::error!(%transaction_id, error = %e, "failed to answer question");
      Err(reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Could not answer the question",
        transaction_id,
      ))
    }
  }
}

fn reject(
  status: StatusCode,
  key: &str,
  message: &str,
  transaction_id: Uuid,
) -> AskRejection {
  (status, Json(BaseResponse::error(vec![ApiError::new(key, message)], transaction_id)))
}
