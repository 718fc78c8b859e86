use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = fairway_api::Args::parse();
	fairway_api::run(args).await
}
