pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server { port: u16, secret_key: SecretString },
}
