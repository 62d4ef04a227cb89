use log::info;
use routcome::{from_async, from_nullable, from_sync, Fault, IntoFault, Outcome};
use std::fmt::Display;

#[derive(Debug, IntoFault)]
struct InvalidPort(String);

impl Display for InvalidPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid port: {:?}", self.0)
    }
}

fn parse_port(raw: &str) -> Result<u16, InvalidPort> {
    raw.parse().map_err(|_| InvalidPort(raw.to_string()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let invalid = from_sync(|| parse_port("http"));
    info!("invalid port: {:?}", invalid);

    let defect: Outcome<u16, Fault> = from_sync(|| {
        let ports: Vec<u16> = Vec::new();
        Ok::<_, Fault>(ports[0])
    });
    info!("defect absorbed: {:?}", defect);

    let host = from_nullable(std::env::var("ROUTCOME_HOST").ok(), || {
        Fault::new("ROUTCOME_HOST is not set")
    })
    .get_or_else(|| "127.0.0.1".to_string());

    let address = futures_executor::block_on(from_sync(|| parse_port("8080")).async_flat_map(
        |port| from_async(move || async move { Ok::<_, Fault>(format!("{}:{}", host, port)) }),
    ));
    info!("address: {:?}", address);

    println!("{}", address.into_anyhow()?);

    Ok(())
}
