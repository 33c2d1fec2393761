mod tests_api_round_trip;
mod tests_round_trip;
