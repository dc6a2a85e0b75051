use log::{error, info};

#[tokio::main]
async fn main()
{   // A missing .env is normal in production
    let dotenv_loaded = dotenv::dotenv().is_ok();

    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    if dotenv_loaded
    {   info!("Loaded environment from .env");
    }

    let config = match revue::Config::from_env()
    {   Ok(c) => c
      , Err(e) => {
          error!("{}", e);
          std::process::exit(1);
        }
    };

    if let Err(e) = revue::serve(config).await
    {   error!("{}", e);
        std::process::exit(1);
    }
}
