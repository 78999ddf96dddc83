#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tabsight_lib::run().await
}
