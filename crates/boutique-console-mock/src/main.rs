fn main() {
    let port = std::env::var("BOUTIQUE_CONSOLE_MOCK_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8990);
    boutique_console_mock::run(&format!("127.0.0.1:{}", port));
}
