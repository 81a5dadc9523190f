use anyhow::Result;
use std::path::PathBuf;

use crate::util::read_all;

pub fn exec(stream: PathBuf) -> Result<()> {
    let bytes = read_all(&stream)?;
    println!("{}", savestream::decode_len(&bytes)?);
    Ok(())
}
