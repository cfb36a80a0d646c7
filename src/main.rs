use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    ollama_chat::cli::main()
}
