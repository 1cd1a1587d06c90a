use node_engine::LibraryError;
use node_engine::run;

fn main() -> Result<(), LibraryError> {
    run(std::env::args().collect())
}
