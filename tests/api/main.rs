mod app;
mod health_check;
mod preflight;
