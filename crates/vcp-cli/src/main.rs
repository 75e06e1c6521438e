// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vcp_cli_config::{ConfigStore, FileConfigStore, CONFIG_PATH_ENV};
use vcp_k8s::KubeClient;
use vcp_management::HttpManagementClient;
use vcp_platform_secret::{apply_platform_secret, PlatformClient};

#[derive(Parser, Debug)]
#[command(name = "vcp-secret", version, about, long_about = None)]
struct Args {
	/// Path to the CLI config file
	#[arg(short, long, env = CONFIG_PATH_ENV)]
	config: Option<PathBuf>,

	/// Log level used when RUST_LOG is not set
	#[arg(long, default_value = "info")]
	log_level: String,

	/// Emit logs as JSON
	#[arg(long)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Make sure the namespace holds a Secret with a valid platform access key
	Apply {
		/// Namespace the virtual cluster lives in
		#[arg(long, short)]
		namespace: String,
		/// Name the virtual cluster is imported under
		#[arg(long, default_value = "")]
		import_name: String,
		/// Platform project the virtual cluster belongs to
		#[arg(long, default_value = "")]
		project: String,
	},
}

fn init_logging(level: &str, json: bool) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	if json {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	init_logging(&args.log_level, args.json_logs);

	let config_store = match args.config {
		Some(path) => FileConfigStore::new(path),
		None => FileConfigStore::discover().context("locate config file")?,
	};
	info!(path = %config_store.path().display(), "Using config file");

	match args.command {
		Command::Apply {
			namespace,
			import_name,
			project,
		} => {
			let config = config_store.load().await.context("load platform config")?;
			let management = HttpManagementClient::from_platform_config(&config)
				.context("create management client")?;
			let mut client =
				PlatformClient::with_config(Arc::new(management), Arc::new(config_store), config)
					.await
					.context("connect to platform")?;
			let kube = KubeClient::new().await.context("create kube client")?;

			let outcome =
				apply_platform_secret(&mut client, &kube, &import_name, &namespace, &project).await?;
			info!(namespace = %namespace, outcome = %outcome, "Done");
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_definition_is_consistent() {
		Args::command().debug_assert();
	}

	#[test]
	fn parses_apply_with_defaults() {
		let args = Args::try_parse_from(["vcp-secret", "apply", "--namespace", "vcluster-a"]).unwrap();
		match args.command {
			Command::Apply {
				namespace,
				import_name,
				project,
			} => {
				assert_eq!(namespace, "vcluster-a");
				assert_eq!(import_name, "");
				assert_eq!(project, "");
			}
		}
		assert!(!args.json_logs);
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn config_flag_reads_config_path_env() {
		let command = Args::command();
		let config = command
			.get_arguments()
			.find(|arg| arg.get_id() == "config")
			.unwrap();
		assert_eq!(config.get_env(), Some(std::ffi::OsStr::new(CONFIG_PATH_ENV)));
	}

	#[test]
	fn apply_requires_namespace() {
		assert!(Args::try_parse_from(["vcp-secret", "apply"]).is_err());
	}
}
