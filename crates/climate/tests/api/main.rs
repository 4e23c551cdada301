mod climate_routes;
mod helpers;
mod startup;
