pub(crate) mod common;




#[cfg(test)]
mod test_status_effects;
