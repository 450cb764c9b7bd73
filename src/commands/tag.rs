// ABOUTME: Tag command implementation.
// ABOUTME: Prints the image tag derived from the revision or build counter.

use rollgate::error::Result;
use rollgate::identity::TagSource;
use rollgate::output::Output;

pub fn tag(source: TagSource, output: &Output) -> Result<()> {
    let tag = source.with_env_defaults().tag()?;
    output.value(tag.as_str());
    Ok(())
}
