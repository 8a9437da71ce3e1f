mod test_utils;

mod grid_test;
mod health_test;
mod program_test;
mod schedule_test;
