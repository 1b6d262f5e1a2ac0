use std::{fs,str,thread};
use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

use encoding_rs::mem::decode_latin1;
use log::{info,warn};

use super::error::{Result,Error};


pub fn fetch_cached(cache_path: &Path, name: &str, url: &str) -> Result<String> {

    let cache_file = cache_path.join(name);

    if cache_file.exists() && fs::metadata(&cache_file)?.modified()?.elapsed()? < Duration::new(1800,0) {
	return Ok(decode(&fs::read(&cache_file)?).into_owned());
    }

    let data = download(url)?;
    fs::create_dir_all(cache_path)?;
    fs::write(&cache_file, &data)?;
    Ok(decode(&data).into_owned())

}


fn download(url: &str) -> Result<Vec<u8>> {

    let mut attempt = 1;
    let mut delay = 2;

    loop {
	info!("Downloading {}...", url);
	match try_download(url) {
	    Ok(data) => return Ok(data),
	    Err(err) => {
		if attempt >= 3 {
		    return Err(err);
		}
		warn!("Download failed ({}), retrying in {}s...", err, delay);
		thread::sleep(Duration::new(delay,0));
		attempt += 1;
		delay *= 2;
	    }
	}
    }

}


fn try_download(url: &str) -> Result<Vec<u8>> {
    let res = reqwest::blocking::get(url)?;
    match res.status().as_u16() {
	200 => Ok(res.bytes()?.to_vec()),
	_ => Err(Error::HttpError(res.status())),
    }
}


fn decode(bytes: &[u8]) -> Cow<str> {
    match str::from_utf8(bytes) {
	Ok(text) => Cow::Borrowed(text),
	Err(_) => Cow::Owned(decode_latin1(bytes).into_owned()),
    }
}
