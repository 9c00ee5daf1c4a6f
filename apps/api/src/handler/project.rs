//! # プロジェクトハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/columns/{project_uuid}` - カラム一覧
//! - `GET /api/models/{project_uuid}` - モデル一覧

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use zeno_domain::column::ZenoColumn;

use crate::{error::ApiError, identity::Viewer, usecase::ProjectUseCaseImpl};

/// プロジェクト API の共有状態
pub struct ProjectState {
    pub usecase: ProjectUseCaseImpl,
}

/// カラム一覧を取得する
#[tracing::instrument(skip_all, fields(%project_uuid))]
pub async fn list_columns(
    State(state): State<Arc<ProjectState>>,
    Path(project_uuid): Path<String>,
    Viewer(viewer): Viewer,
) -> Result<Json<Vec<ZenoColumn>>, ApiError> {
    let columns = state.usecase.list_columns(&project_uuid, viewer).await?;
    Ok(Json(columns))
}

/// モデル一覧を取得する
#[tracing::instrument(skip_all, fields(%project_uuid))]
pub async fn list_models(
    State(state): State<Arc<ProjectState>>,
    Path(project_uuid): Path<String>,
    Viewer(viewer): Viewer,
) -> Result<Json<Vec<String>>, ApiError> {
    let models = state.usecase.list_models(&project_uuid, viewer).await?;
    Ok(Json(models))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        identity::USER_ID_HEADER,
        test_utils::{CLASSIFICATION_PROJECT, OWNER, PRIVATE_PROJECT, TestRepositories},
        usecase::ProjectAccessChecker,
    };

    fn create_test_app(repos: &TestRepositories) -> Router {
        let usecase = ProjectUseCaseImpl::new(
            ProjectAccessChecker::new(Arc::new(repos.projects.clone())),
            Arc::new(repos.columns.clone()),
        );
        Router::new()
            .route("/columns/{project_uuid}", get(list_columns))
            .route("/models/{project_uuid}", get(list_models))
            .with_state(Arc::new(ProjectState { usecase }))
    }

    #[tokio::test]
    async fn test_カラム一覧がcamel_caseで返る() {
        // Given
        let sut = create_test_app(&TestRepositories::with_projects());
        let request = Request::builder()
            .uri(format!("/columns/{CLASSIFICATION_PROJECT}"))
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body[0],
            serde_json::json!({
                "id": "7",
                "name": "correct",
                "columnType": "FEATURE",
                "dataType": "BOOLEAN",
                "model": "gpt2"
            })
        );
    }

    #[tokio::test]
    async fn test_所有者は非公開プロジェクトのモデル一覧を取得できる() {
        // Given
        let sut = create_test_app(&TestRepositories::with_projects());
        let request = Request::builder()
            .uri(format!("/models/{PRIVATE_PROJECT}"))
            .header(USER_ID_HEADER, OWNER.to_string())
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let models: Vec<String> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(models, vec!["bert", "gpt2"]);
    }

    #[tokio::test]
    async fn test_不正なユーザーidヘッダーで400が返る() {
        // Given
        let sut = create_test_app(&TestRepositories::with_projects());
        let request = Request::builder()
            .uri(format!("/models/{CLASSIFICATION_PROJECT}"))
            .header(USER_ID_HEADER, "alice")
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
