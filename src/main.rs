fn main() {
    let _ = tracing_subscriber::fmt().try_init();
    ai_chat::config::load_dotenv();
    dioxus::launch(ai_chat::ui::App);
}
