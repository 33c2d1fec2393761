mod tests_fixtures;
