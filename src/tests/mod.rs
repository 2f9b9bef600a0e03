#[cfg(test)]
pub mod common;

#[cfg(test)]
mod stale_degradation;
