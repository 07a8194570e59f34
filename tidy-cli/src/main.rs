use std::io;

fn main() -> io::Result<()> {
    tidy_cli::main()
}
