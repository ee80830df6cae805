use futures_util::future::LocalBoxFuture;
use gloo::net::http::Request;

use player_shell_core::{FetchedProject, ProjectFetcher};

pub(crate) struct HttpProjectFetcher;

impl ProjectFetcher for HttpProjectFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<FetchedProject, String>> {
        Box::pin(async move {
            gloo::console::log!("project fetch: start", url);
            let response = Request::get(url).send().await.map_err(|err| err.to_string())?;
            let status = response.status();
            if status != 200 {
                return Ok(FetchedProject {
                    status,
                    body: Vec::new(),
                });
            }
            let body = response.binary().await.map_err(|err| err.to_string())?;
            gloo::console::log!("project fetch: done", body.len() as u32);
            Ok(FetchedProject { status, body })
        })
    }
}
