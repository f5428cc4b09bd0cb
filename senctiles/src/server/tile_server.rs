use super::routes::{AppState, build_router};
use crate::config::ServerConfig;
use anyhow::{Context, Result};
use tokio::sync::oneshot::Sender;

pub struct TileServer {
	address: String,
	state: AppState,
	exit_signal: Option<Sender<()>>,
}

impl TileServer {
	pub fn from_config(config: &ServerConfig, state: AppState) -> TileServer {
		TileServer {
			address: config.address(),
			state,
			exit_signal: None,
		}
	}

	/// Binds the listener and serves in the background. Returns the bound address.
	pub async fn start(&mut self) -> Result<String> {
		if self.exit_signal.is_some() {
			self.stop();
		}

		log::info!("starting server");
		let router = build_router(self.state.clone());

		let listener = tokio::net::TcpListener::bind(&self.address)
			.await
			.with_context(|| format!("Failed to bind to {}", self.address))?;
		let address = listener.local_addr()?.to_string();
		log::info!("server listens on {address}");

		let (tx, rx) = tokio::sync::oneshot::channel::<()>();
		tokio::spawn(async move {
			let result = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await;
			if let Err(err) = result {
				log::error!("server stopped with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		Ok(address)
	}

	pub fn stop(&mut self) {
		if let Some(exit_signal) = self.exit_signal.take() {
			log::info!("stopping server");
			exit_signal.send(()).ok();
		}
	}
}
