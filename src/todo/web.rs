//! A small HTML front end for the to-do list, served with axum.
//!
//! Routes:
//! - `GET /` lists the tasks and shows a form for adding one
//! - `POST /agregar` adds the task in the `texto` form field and redirects to `/`
//! - `GET /completar/{id}` completes a task and redirects to `/`
//! - `GET /about` describes the app
//!
//! Anything else is a 404.

use crate::model::Task;
use crate::todo::{Persist, TodoStore};
use crate::Result;
use anyhow::Context;
use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// The store shared between requests.
pub type SharedStore<P> = Arc<Mutex<TodoStore<P>>>;

/// Binds `addr` and serves the app until the process is stopped.
pub async fn serve<P>(store: TodoStore<P>, addr: SocketAddr) -> Result<()>
where
    P: Persist + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Unable to listen on {addr}"))?;
    info!(
        "To-do app listening on http://{}",
        listener.local_addr().context("Unable to read the bound address")?
    );
    serve_listener(listener, Arc::new(Mutex::new(store))).await
}

/// Serves the app on an already bound `listener`.
pub async fn serve_listener<P>(listener: TcpListener, store: SharedStore<P>) -> Result<()>
where
    P: Persist + 'static,
{
    axum::serve(listener, router(store))
        .await
        .context("The to-do web server failed")
}

/// Builds the routes of the app over `store`.
pub fn router<P>(store: SharedStore<P>) -> Router
where
    P: Persist + 'static,
{
    Router::new()
        .route("/", get(index::<P>).fallback(not_found))
        .route("/agregar", post(add::<P>).fallback(not_found))
        .route("/completar/{id}", get(complete::<P>).fallback(not_found))
        .route("/about", get(about).fallback(not_found))
        .fallback(not_found)
        .with_state(store)
}

/// Renders as a 500 page and logs the cause.
struct WebError(anyhow::Error);

impl From<anyhow::Error> for WebError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

#[derive(Debug, Deserialize)]
struct AddForm {
    #[serde(default)]
    texto: String,
}

#[derive(Template)]
#[template(path = "todo/index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
    tasks: &'a [Task],
}

#[derive(Template)]
#[template(path = "todo/about.html")]
struct AboutTemplate<'a> {
    title: &'a str,
}

fn render(template: impl Template) -> std::result::Result<Html<String>, WebError> {
    let page = template.render().context("Unable to render the page")?;
    Ok(Html(page))
}

async fn index<P: Persist>(
    State(store): State<SharedStore<P>>,
) -> std::result::Result<Html<String>, WebError> {
    let store = store.lock().await;
    render(IndexTemplate {
        title: "Lista de tareas",
        tasks: store.tasks(),
    })
}

async fn add<P: Persist>(
    State(store): State<SharedStore<P>>,
    Form(form): Form<AddForm>,
) -> std::result::Result<Redirect, WebError> {
    let text = form.texto.trim();
    if text.is_empty() {
        debug!("Ignoring a blank task");
    } else {
        let task = store.lock().await.add(text).await?;
        info!("Added task {}", task.id());
    }
    Ok(Redirect::to("/"))
}

async fn complete<P: Persist>(
    State(store): State<SharedStore<P>>,
    Path(id): Path<String>,
) -> std::result::Result<Response, WebError> {
    let id = match id.parse::<u32>() {
        Ok(id) => id,
        Err(_) => return Ok(not_found().await.into_response()),
    };
    if store.lock().await.complete(id).await?.is_some() {
        info!("Completed task {id}");
    }
    Ok(Redirect::to("/").into_response())
}

async fn about() -> std::result::Result<Html<String>, WebError> {
    render(AboutTemplate { title: "Acerca de" })
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskList;
    use crate::todo::MemoryPersist;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    struct TestApp {
        store: SharedStore<MemoryPersist>,
        persist: MemoryPersist,
    }

    impl TestApp {
        async fn new() -> Self {
            Self::with_persist(MemoryPersist::new()).await
        }

        async fn with_persist(persist: MemoryPersist) -> Self {
            let store = TodoStore::open(persist.clone()).await.unwrap();
            Self {
                store: Arc::new(Mutex::new(store)),
                persist,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            router(self.store.clone()).oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            self.send(request).await
        }

        async fn post_form(&self, uri: &str, form: &str) -> Response {
            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap();
            self.send(request).await
        }
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn assert_redirects_home(response: &Response) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_index_lists_tasks() {
        let app = TestApp::new().await;
        {
            let mut store = app.store.lock().await;
            store.add("comprar pan").await.unwrap();
            store.add("<script>").await.unwrap();
            store.complete(1).await.unwrap();
        }

        let response = app.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"), "{content_type}");
        let body = body_text(response).await;
        assert!(body.contains("<title>Lista de tareas</title>"));
        assert!(body.contains("<s>comprar pan</s>"));
        assert!(!body.contains("<script>"), "{body}");
        assert!(body.contains("script"));
        assert!(body.contains("/completar/2"));
        assert!(!body.contains("/completar/1\""));
        assert!(body.contains("action=\"/agregar\""));
    }

    #[tokio::test]
    async fn test_index_without_tasks() {
        let app = TestApp::new().await;
        let body = body_text(app.get("/").await).await;
        assert!(body.contains("No hay tareas."));
    }

    #[tokio::test]
    async fn test_add_redirects_and_saves() {
        let app = TestApp::new().await;
        let response = app.post_form("/agregar", "texto=Lavar+los+platos%21").await;
        assert_redirects_home(&response);
        let store = app.store.lock().await;
        assert_eq!(store.tasks()[0].text(), "Lavar los platos!");
        assert_eq!(app.persist.save_count(), 1);
    }

    #[tokio::test]
    async fn test_add_blank_is_ignored() {
        let app = TestApp::new().await;
        for form in ["texto=+++", "", "other=x"] {
            assert_redirects_home(&app.post_form("/agregar", form).await);
        }
        assert!(app.store.lock().await.tasks().is_empty());
        assert_eq!(app.persist.save_count(), 0);
    }

    #[tokio::test]
    async fn test_complete_route() {
        let app = TestApp::new().await;
        app.store.lock().await.add("a").await.unwrap();

        assert_redirects_home(&app.get("/completar/1").await);
        assert!(app.store.lock().await.tasks()[0].completed());

        assert_redirects_home(&app.get("/completar/42").await);
        assert_eq!(app.get("/completar/abc").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_about_and_unknown_routes() {
        let app = TestApp::new().await;
        let response = app.get("/about").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Acerca de"));

        assert_eq!(app.get("/nope").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/agregar").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            app.post_form("/about", "").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_save_failure_is_500() {
        let app = TestApp::new().await;
        app.persist.fail_saves(true);
        let response = app.post_form("/agregar", "texto=x").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_add_with_ids_exhausted_is_500() {
        let seeded = TaskList {
            tasks: Vec::new(),
            next_id: u32::MAX,
        };
        let app = TestApp::with_persist(MemoryPersist::with_list(seeded)).await;
        let response = app.post_form("/agregar", "texto=x").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.store.lock().await.tasks().is_empty());
    }
}
