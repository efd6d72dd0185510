mod collections;
mod scalars;
mod utils;
