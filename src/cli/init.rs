use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_name = name.unwrap_or_else(|| "My Blog".to_string());

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;
    std::fs::create_dir_all(path.join("data/media"))?;

    let config = format!(
        r#"[site]
title = "{}"
description = "A personal blog"
url = "http://localhost:3000"

[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/bramble.db"

[content]
front_page_limit = 5
tag_page_limit = 20
teaser_length = 200

[media]
dir = "./data/media"
"#,
        site_name
    );

    std::fs::write(path.join("bramble.toml"), config)?;

    tracing::info!("Created new Bramble site at {:?}", path);
    tracing::info!("Run 'bramble migrate' to set up the database");
    tracing::info!("Run 'bramble serve' to start the server");

    Ok(())
}
