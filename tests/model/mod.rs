mod tests_lookup;
mod tests_references;
