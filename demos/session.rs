use std::sync::Arc;

use api_session::{ApiResponse, ApiSession, ChannelNavigator, Config, RequestDescriptor, WalletApi};
use reqwest::Method;
use serde_json::Value;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the example
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Load configuration from a JSON file placed next to the binary
    let cfg = Config::from_file("config.json")?;
    let (tx, mut redirects) = tokio::sync::mpsc::unbounded_channel();
    let session = ApiSession::new(cfg)?.with_navigator(Arc::new(ChannelNavigator::new(tx)));
    if !session.credentials().has_token() {
        session.sign_in(std::env::var("API_TOKEN")?);
    }

    let wallet = WalletApi::new(&session);
    let created: ApiResponse<Value> = wallet.create_wallet().await?;
    println!("create wallet: {:?}", created);

    // background poll: never redirect
    let poll = RequestDescriptor::new(Method::GET, "v1/wallet/w1/balance").suppress_redirect();
    let balance: ApiResponse<Value> = session.request(&poll).await?;
    println!("balance: {:?}", balance);

    while let Ok(path) = redirects.try_recv() {
        println!("would navigate to {path}");
    }
    session.sign_out();
    Ok(())
}
