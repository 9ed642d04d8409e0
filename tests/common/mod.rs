//! Local HTTP server standing in for the Kubernetes API

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use kube::{Client, Config};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A request seen by the server
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

type Routes = Arc<HashMap<String, (StatusCode, Value)>>;
type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

pub struct MockApiServer {
    addr: SocketAddr,
    recorded: Recorded,
}

impl MockApiServer {
    /// Serve canned JSON responses keyed by request path; anything else is 404
    pub async fn start(routes: Vec<(&str, StatusCode, Value)>) -> Self {
        let routes: Routes = Arc::new(
            routes
                .into_iter()
                .map(|(path, status, body)| (path.to_string(), (status, body)))
                .collect(),
        );
        let recorded: Recorded = Arc::default();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server_recorded = recorded.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let io = TokioIo::new(stream);
                let routes = routes.clone();
                let recorded = server_recorded.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let routes = routes.clone();
                        let recorded = recorded.clone();
                        async move { handle_request(req, &routes, &recorded) }
                    });
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self { addr, recorded }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client talking directly to this server
    pub fn client(&self) -> Client {
        let config = Config::new(self.url().parse().unwrap());
        Client::try_from(config).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

fn handle_request(
    req: Request<hyper::body::Incoming>,
    routes: &Routes,
    recorded: &Recorded,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    recorded.lock().unwrap().push(RecordedRequest {
        path: path.clone(),
        query: req.uri().query().map(str::to_string),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, status_body(404, "NotFound", &path)));

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap())
}

/// Kubernetes `Status` failure body
pub fn status_body(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code,
    })
}

/// Path of a namespaced secret on the core API
pub fn secret_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/namespaces/{}/secrets/{}", namespace, name)
}

/// Basic-auth secret `db-creds` holding admin / s3cr3t
pub fn db_creds_secret(namespace: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": "db-creds",
            "namespace": namespace,
            "resourceVersion": "4711",
            "labels": { "app": "db" },
            "annotations": { "owner": "qa" },
        },
        "type": "kubernetes.io/basic-auth",
        "data": {
            "username": "YWRtaW4=",
            "password": "czNjcjN0",
        },
    })
}
