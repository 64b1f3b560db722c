//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site from the published content
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let cms = blog.cms()?;
    let generator = Generator::new(blog)?;
    let stats = generator.generate(&cms).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts and {} listing pages in {:.2}s",
        stats.posts,
        stats.pages,
        duration.as_secs_f64()
    );

    Ok(())
}
