use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = fairway_worker::Args::parse();
	fairway_worker::run(args).await
}
