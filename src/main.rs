use hookload::entry;
use hookload::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
