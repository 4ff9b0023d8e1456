use std::env;

fn main() {
    dotenvy::dotenv().ok();

    let base_url = env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:10000".to_string());
    let output_path = env::var("OUTPUT_PATH").unwrap_or_else(|_| "generated.png".to_string());

    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.is_empty() {
        "a tyrannosaurus rex wearing sunglasses, surfing a giant wave at sunset".to_string()
    } else {
        prompt
    };

    println!("Testing image generation...");
    println!("  Server: {}", base_url);
    println!("  Prompt: {}", prompt);
    println!();

    let url = format!("{}/generate-image", base_url.trim_end_matches('/'));

    let client = reqwest::blocking::Client::new();
    let resp = client
        .post(&url)
        .json(&serde_json::json!({ "prompt": prompt }))
        .send();

    match resp {
        Ok(r) => {
            let status = r.status();
            let content_type = r
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            if status.is_success() && content_type.starts_with("image/") {
                match r.bytes() {
                    Ok(bytes) => match std::fs::write(&output_path, &bytes) {
                        Ok(()) => {
                            println!("OK ({})", status);
                            println!("  Saved {} bytes to {}", bytes.len(), output_path);
                        }
                        Err(e) => {
                            println!("Failed to write {}: {}", output_path, e);
                            std::process::exit(1);
                        }
                    },
                    Err(e) => {
                        println!("Failed to read image body: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                let body = r.text().unwrap_or_default();
                let json: serde_json::Value =
                    serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body.clone()));
                println!("ERROR ({})", status);
                println!("{}", serde_json::to_string_pretty(&json).unwrap_or(body));
                std::process::exit(1);
            }
        }
        Err(e) => {
            println!("Request failed: {}", e);
            println!("Is the server running at {}?", base_url);
            std::process::exit(1);
        }
    }
}
