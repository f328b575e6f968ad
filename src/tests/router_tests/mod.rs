mod api_tests;
mod auth_flow_tests;
mod bookings_tests;
