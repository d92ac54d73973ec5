use cloud_entity_store::{AppStorage, Order, Product, StorageConfig};

#[tokio::main]
async fn main() {
    std::fs::create_dir_all("./demos/data").unwrap();
    let storage_config = StorageConfig::local().with_option("path", "./demos/data");
    let storage = AppStorage::builder(storage_config).build().await.unwrap();

    let image = storage
        .images
        .upload_unique("saw.png", b"not really a png".to_vec())
        .await
        .unwrap();
    let mut saw = Product::new("tools", "saw", "Saw", 19.5);
    saw.image_url = Some(image.address.to_string());
    match storage.products.add(saw).await {
        Ok(product) => println!("Added product {} ({})", product.name, image.address),
        Err(e) => println!("{}", e),
    }

    let order_id = uuid::Uuid::new_v4().to_string();
    storage
        .orders
        .add(Order::new("cust-1", &order_id, "cust-1", "saw", 2))
        .await
        .unwrap();
    storage.order_queue.enqueue(order_id).await.unwrap();

    if let Some(message) = storage.order_queue.dequeue().await.unwrap() {
        let order = storage.orders.get("cust-1", &message.body).await.unwrap();
        println!("Processing {:?}", order);
    }

    // Replace-by-tag is not available on the local filesystem
    let product = storage.products.get("tools", "saw").await.unwrap().unwrap();
    if let Err(e) = storage.products.update(product).await {
        println!("Update on local storage: {}", e);
    }
}
