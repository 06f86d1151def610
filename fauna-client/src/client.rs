use std::fmt;
use std::sync::Arc;

use fauna_protocol::codec::{parse_resource, serialize};
use fauna_protocol::expr::Expr;
use fauna_protocol::value::Value;
use tokio::runtime::{self, Handle, Runtime};

use crate::builder::{Builder, Config};
use crate::errors::{check_response, ClientError, Error, ErrorKind};
use crate::query_result::QueryResult;
use crate::transport::{HttpTransport, Request, Transport};

/// Fauna Client
///
/// Every query is sent as its own request on the tokio runtime and
/// delivered through a [`QueryResult`]. The client is cheap to clone, all
/// clones share the transport and the runtime.
///
/// ```rust,no_run
/// # use std::time::Duration;
/// # use fauna_protocol::query::{class, get};
/// # fn main() -> Result<(), fauna_client::Error> {
/// let client = fauna_client::create_client()?;
/// let spells = client.query(&get(class("spells")))
///     .wait(Duration::from_secs(5))?;
/// println!("{:?}", spells);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    runtime: Arc<RuntimeRef>,
    secret: Arc<str>,
}

/// The runtime queries are spawned on.
///
/// A runtime is only created when the client is built outside of one.
struct RuntimeRef {
    owned: Option<Runtime>,
    handle: Handle,
}

impl RuntimeRef {
    fn current_or_new() -> Result<RuntimeRef, Error> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(RuntimeRef { owned: None, handle });
        }
        let runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("fauna-client")
            .build()
            .map_err(|e| {
                ClientError::with_source(e).context("cannot start runtime")
            })?;
        log::debug!("Started a runtime for the client");
        Ok(RuntimeRef {
            handle: runtime.handle().clone(),
            owned: Some(runtime),
        })
    }
}

impl Drop for RuntimeRef {
    fn drop(&mut self) {
        if let Some(runtime) = self.owned.take() {
            // dropping a runtime blocks, which is not allowed in async code
            runtime.shutdown_background();
        }
    }
}

impl Client {
    /// Create a client that talks HTTP to the configured endpoint.
    ///
    /// Uses the tokio runtime the call is made in, or starts a runtime
    /// owned by the client when there is none.
    pub fn new(config: &Config) -> Result<Client, Error> {
        let transport = HttpTransport::new(config)?;
        Client::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>)
        -> Result<Client, Error>
    {
        log::debug!("Creating client for {}", config.endpoint());
        Ok(Client {
            transport,
            runtime: Arc::new(RuntimeRef::current_or_new()?),
            secret: config.shared_secret(),
        })
    }

    /// A client that authenticates with `secret` instead.
    ///
    /// The new client shares the transport and the runtime with this one.
    pub fn with_secret(&self, secret: impl Into<String>) -> Client {
        Client {
            transport: self.transport.clone(),
            runtime: self.runtime.clone(),
            secret: Arc::from(secret.into()),
        }
    }

    /// Send a query.
    ///
    /// Returns immediately. The result completes with the `resource` of the
    /// response, or with an error describing why there is none.
    pub fn query<E: Expr + ?Sized>(&self, expr: &E) -> QueryResult<Value> {
        let request = Request {
            secret: self.secret.clone(),
            body: serialize(expr),
        };
        log::debug!("Query: {}", String::from_utf8_lossy(&request.body));
        let result = QueryResult::new();
        let target = result.clone();
        let transport = self.transport.clone();
        self.runtime.handle.spawn(async move {
            target.complete(execute(&*transport, request).await);
        });
        result
    }
}

async fn execute(transport: &dyn Transport, request: Request)
    -> Result<Value, Error>
{
    let response = transport.send(request).await?;
    if let Some(err) = check_response(response.status, &response.body) {
        log::debug!("Query failed: {}", err);
        return Err(err);
    }
    Ok(parse_resource(&response.body)?)
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client")
            .field("owns_runtime", &self.runtime.owned.is_some())
            .finish_non_exhaustive()
    }
}

/// Create a client configured from the environment.
///
/// Reads `FAUNA_SECRET` (required), `FAUNA_ENDPOINT` and `FAUNA_TIMEOUT`.
pub fn create_client() -> Result<Client, Error> {
    Client::new(&Builder::from_env()?.build()?)
}
