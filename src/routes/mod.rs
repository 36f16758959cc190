pub mod archive;
pub mod auth;
pub mod catchers;
pub mod health;
pub mod knowledge;
pub mod users;

use rocket::{catchers, routes};

pub fn get_routes() -> Vec<rocket::Route> {
    routes![
        health::index,
        health::health_check,
        // Authentication
        auth::login,
        auth::logout,
        auth::me,
        auth::register,
        // Users and roles
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::create_role,
        users::list_roles,
        users::update_role,
        users::delete_role,
        // Archive
        archive::create_category,
        archive::list_categories,
        archive::update_category,
        archive::delete_category,
        archive::create_archive,
        archive::list_archives,
        archive::get_archive,
        archive::update_archive,
        archive::delete_archive,
        // Knowledge base
        knowledge::list_tags,
        knowledge::create_category,
        knowledge::list_categories,
        knowledge::update_category,
        knowledge::delete_category,
        knowledge::create_article,
        knowledge::list_articles,
        knowledge::get_article,
        knowledge::update_article,
        knowledge::publish_article,
        knowledge::unpublish_article,
        knowledge::delete_article,
    ]
}

pub fn get_catchers() -> Vec<rocket::Catcher> {
    catchers![
        catchers::bad_request,
        catchers::unauthorized,
        catchers::not_found,
        catchers::unprocessable_entity,
        catchers::internal_error,
        catchers::default_catcher,
    ]
}
