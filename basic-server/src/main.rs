use std::{env, path::PathBuf, process::ExitCode};

use folio_basic_server::{bootstrap, load_settings};

/// Prepares the database and the file root. Usage: `folio-basic-server [config.yaml]`
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let config = env::args_os().nth(1).map(PathBuf::from);

	let res = async {
		let settings = load_settings(config.as_deref()).await?;
		bootstrap(settings).await
	}
	.await;

	match res {
		Ok(_app) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("folio: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
