pub mod pool;

use chrono::Local;
use colored::*;
use hyper::body::Bytes;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::client::{build_client, HttpsClient};
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::models::api::{
    search_payload, synthetic_login, BoardsQuery, CreateGameRequest, LoginRequest,
    RegisterRequest, TokenResponse,
};
use crate::models::job::{Auth, RequestJob};
use crate::models::metrics::{LatencyTable, TokenMap};
use crate::report::Reporter;
use crate::utils::hardware::cpu_cores;

use self::pool::WorkerPool;

pub const REGISTER_ROUTE: &str = "/user/register";
pub const LOGIN_ROUTE: &str = "/user/login";
pub const PROFILE_ROUTE: &str = "/user/me";
pub const SEARCH_ROUTE: &str = "/user/search";
pub const BOARDS_ROUTE: &str = "/game/boards";
pub const CREATE_GAME_ROUTE: &str = "/game/create";

/// Issues the benchmark phases against one backend.
#[derive(Debug, Clone)]
pub struct LoadGenerator {
    client: HttpsClient,
    base_url: Url,
    pool: WorkerPool,
    requests: usize,
}

impl LoadGenerator {
    pub fn new(base_url: Url, workers: usize, requests: usize) -> Self {
        Self {
            client: build_client(),
            base_url,
            pool: WorkerPool::new(workers),
            requests,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub async fn register_users(&self, count: usize) -> Result<(TokenMap, LatencyTable)> {
        let url = self.endpoint(REGISTER_ROUTE)?;
        let users: Vec<RegisterRequest> = (0..count).map(RegisterRequest::synthetic).collect();
        let jobs = users
            .iter()
            .map(|user| Ok(RequestJob::post(url.clone()).with_json(user)?))
            .collect::<Result<Vec<_>>>()?;
        let logins = users.into_iter().map(|user| user.login).collect();

        self.collect_tokens(REGISTER_ROUTE, jobs, logins).await
    }

    pub async fn login_users(&self, count: usize) -> Result<(TokenMap, LatencyTable)> {
        let url = self.endpoint(LOGIN_ROUTE)?;
        let users: Vec<LoginRequest> = (0..count).map(LoginRequest::synthetic).collect();
        let jobs = users
            .iter()
            .map(|user| Ok(RequestJob::post(url.clone()).with_json(user)?))
            .collect::<Result<Vec<_>>>()?;
        let logins = users.into_iter().map(|user| user.login).collect();

        self.collect_tokens(LOGIN_ROUTE, jobs, logins).await
    }

    async fn collect_tokens(
        &self,
        route: &str,
        jobs: Vec<RequestJob>,
        logins: Vec<String>,
    ) -> Result<(TokenMap, LatencyTable)> {
        let mut tokens = TokenMap::new();
        let table = self
            .pool
            .run_batch(&self.client, route, jobs, |index, body| {
                let login = &logins[index];
                tokens.insert(login.clone(), extract_token(login, body)?);
                Ok(())
            })
            .await?;
        Ok((tokens, table))
    }

    pub async fn fetch_profile(&self, tokens: &TokenMap) -> Result<LatencyTable> {
        let url = self.endpoint(PROFILE_ROUTE)?;
        let jobs = tokens
            .values()
            .map(|token| RequestJob::get(url.clone()).with_auth(Auth::bearer(token.as_str())))
            .collect();

        self.run(PROFILE_ROUTE, jobs).await
    }

    /// Every search job carries the same large query and the same credential.
    pub async fn search_users(&self, token: &str) -> Result<LatencyTable> {
        let url = self.endpoint(SEARCH_ROUTE)?;
        let query = Bytes::from(serde_json::to_vec(&search_payload(self.requests))?);
        let jobs = (0..self.requests)
            .map(|_| {
                RequestJob::post(url.clone())
                    .with_body(query.clone())
                    .with_auth(Auth::bearer(token))
            })
            .collect();

        self.run(SEARCH_ROUTE, jobs).await
    }

    pub async fn list_boards(&self) -> Result<LatencyTable> {
        let url = self.endpoint(BOARDS_ROUTE)?;
        let jobs = (0..self.requests)
            .map(|_| RequestJob::get(url.clone()))
            .collect();

        self.run("/game/boards (GET)", jobs).await
    }

    pub async fn create_board_query(&self) -> Result<LatencyTable> {
        let url = self.endpoint(BOARDS_ROUTE)?;
        let jobs = (0..self.requests)
            .map(|i| Ok(RequestJob::post(url.clone()).with_json(&BoardsQuery::alternating(i))?))
            .collect::<Result<Vec<_>>>()?;

        self.run("/game/boards (POST)", jobs).await
    }

    pub async fn create_game(&self, tokens: &TokenMap, with_password: bool) -> Result<LatencyTable> {
        let url = self.endpoint(CREATE_GAME_ROUTE)?;
        let payload = CreateGameRequest::new(with_password);
        let jobs = tokens
            .values()
            .map(|token| {
                Ok(RequestJob::post(url.clone())
                    .with_json(&payload)?
                    .with_auth(Auth::bearer(token.as_str())))
            })
            .collect::<Result<Vec<_>>>()?;

        let route = if with_password {
            "/game/create (with password)"
        } else {
            "/game/create (passwordless)"
        };
        self.run(route, jobs).await
    }

    async fn run(&self, route: &str, jobs: Vec<RequestJob>) -> Result<LatencyTable> {
        self.pool.run_batch(&self.client, route, jobs, |_, _| Ok(())).await
    }
}

fn extract_token(login: &str, body: &Value) -> Result<String> {
    TokenResponse::deserialize(body)
        .map(|response| response.token)
        .map_err(|_| BenchError::MissingToken {
            login: login.to_string(),
        })
}

/// Runs every phase in order, reporting each table before starting the next.
pub async fn run_benchmark(config: &BenchConfig) -> Result<()> {
    let generator = LoadGenerator::new(config.base_url.clone(), config.workers, config.requests);
    let reporter = Reporter::new(config.report.clone());
    let count = generator.requests();

    println!();
    println!("{}", "======== UAPOLY BACKEND BENCHMARK ========".bold().white().on_blue());
    println!("{} {}", "Target          :".bold().bright_blue(), config.target().bold());
    println!(
        "{} {}",
        "Started at      :".bold().bright_blue(),
        Local::now().format("%Y/%m/%d %H:%M:%S").to_string().bold()
    );
    println!("{} {}", "Requests/phase  :".bold().bright_blue(), count.to_string().bold());
    println!("{} {}", "Workers         :".bold().bright_blue(), generator.workers().to_string().bold());
    println!("{} {}", "CPU cores       :".bold().bright_blue(), cpu_cores().to_string().bold());

    phase_header(REGISTER_ROUTE);
    let (_, register) = generator.register_users(count).await?;
    reporter.display(&register)?;
    drop(register);

    phase_header(LOGIN_ROUTE);
    let (tokens, login) = generator.login_users(count).await?;
    reporter.display(&login)?;
    drop(login);

    phase_header(PROFILE_ROUTE);
    reporter.display(&generator.fetch_profile(&tokens).await?)?;

    phase_header(SEARCH_ROUTE);
    let first = synthetic_login(0);
    let token = tokens
        .get(&first)
        .ok_or_else(|| BenchError::MissingToken { login: first.clone() })?;
    reporter.display(&generator.search_users(token).await?)?;

    phase_header("/game/boards (GET)");
    reporter.display(&generator.list_boards().await?)?;

    phase_header("/game/boards (POST)");
    reporter.display(&generator.create_board_query().await?)?;

    phase_header("/game/create (passwordless)");
    reporter.display(&generator.create_game(&tokens, false).await?)?;

    phase_header("/game/create (with password)");
    reporter.display(&generator.create_game(&tokens, true).await?)?;

    Ok(())
}

fn phase_header(route: &str) {
    println!();
    println!("{}", format!("--- {} ---", route).bold().cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_is_read_from_body() {
        let token = extract_token("User0", &json!({ "token": "abc" })).unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn missing_token_names_the_login() {
        let err = extract_token("User3", &json!({ "error": "taken" })).unwrap_err();
        match err {
            BenchError::MissingToken { login } => assert_eq!(login, "User3"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_string_token_is_missing() {
        assert!(extract_token("User0", &json!({ "token": 12 })).is_err());
        assert!(extract_token("User0", &Value::Null).is_err());
    }

    #[test]
    fn endpoints_join_base_url() {
        let generator = LoadGenerator::new(Url::parse("http://localhost:8080").unwrap(), 2, 10);
        assert_eq!(
            generator.endpoint(CREATE_GAME_ROUTE).unwrap().as_str(),
            "http://localhost:8080/game/create"
        );
        assert_eq!(generator.workers(), 2);
        assert_eq!(generator.requests(), 10);
    }
}
