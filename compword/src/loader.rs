use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, trace, warn};

use crate::config::EncodingMode;
use crate::errors::{FinderError, FinderResult};

// Constants for word list reading
const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// Decodes bytes into a String according to the encoding mode
fn decode_bytes(bytes: &[u8], path: &Path, encoding_mode: EncodingMode) -> FinderResult<String> {
    match encoding_mode {
        EncodingMode::FailFast => String::from_utf8(bytes.to_vec())
            .map_err(|e| FinderError::encoding_error(path, e)),
        EncodingMode::Lossy => {
            let cow = String::from_utf8_lossy(bytes);
            // Owned means at least one invalid sequence was replaced
            if let std::borrow::Cow::Owned(_) = cow {
                warn!("Invalid UTF-8 replaced in file: {}", path.display());
            }
            Ok(cow.into_owned())
        }
    }
}

/// Normalizes raw text into words: one per line, trimmed, lowercased,
/// blank lines dropped.
pub fn words_from_str(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn read_small(path: &Path) -> FinderResult<Vec<u8>> {
    trace!("Reading whole file: {}", path.display());
    std::fs::read(path).map_err(|e| FinderError::from_io(path, e))
}

fn read_buffered(path: &Path) -> FinderResult<Vec<u8>> {
    trace!("Reading buffered: {}", path.display());
    let file = File::open(path).map_err(|e| FinderError::from_io(path, e))?;
    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn read_mapped(path: &Path, encoding_mode: EncodingMode) -> FinderResult<String> {
    trace!("Memory mapping: {}", path.display());
    let file = File::open(path).map_err(|e| FinderError::from_io(path, e))?;
    // The map is only read while the file is open and is dropped before returning
    let mmap = unsafe { Mmap::map(&file) }?;
    decode_bytes(&mmap, path, encoding_mode)
}

/// Loads a word list: one word per line, lowercased.
///
/// The reading strategy follows the file size: small files are read in one
/// go, mid-size ones through a buffer, very large ones are memory mapped.
pub fn load_words(path: &Path, encoding_mode: EncodingMode) -> FinderResult<Vec<String>> {
    info!("Reading input file {}", path.display());

    let text = match path.metadata() {
        Ok(metadata) if metadata.len() >= LARGE_FILE_THRESHOLD => {
            read_mapped(path, encoding_mode)?
        }
        Ok(metadata) if metadata.len() < SMALL_FILE_THRESHOLD => {
            decode_bytes(&read_small(path)?, path, encoding_mode)?
        }
        Ok(_) => decode_bytes(&read_buffered(path)?, path, encoding_mode)?,
        Err(e) => return Err(FinderError::from_io(path, e)),
    };

    let words = words_from_str(&text);
    info!("Imported {} words", words.len());
    debug!("Word list {} decoded with {:?}", path.display(), encoding_mode);
    Ok(words)
}
