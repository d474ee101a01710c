//! Text clean-up for values read off rendered pages.

pub mod counts;
pub mod text;

#[cfg(test)]
mod tests;
