pub mod scripted_service;
