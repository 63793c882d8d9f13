// goby: Readers for the Goby compact reads and alignment formats.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Streaming decoders for chunked files.
//!
//! [EntryIterator] yields the entries of a chunked file one at a time,
//! decoding one chunk at a time. [Entries] does the same for a schema chosen
//! at runtime.
//!
pub mod chunks;
pub mod collection;

use crate::decoder::chunks::ChunkReader;
use crate::decoder::collection::decode_collection;
use crate::decoder::collection::Collection;
use crate::decoder::collection::Record;
use crate::decoder::collection::Schema;
use crate::error::GobyError;
use crate::format::AlignmentCollection;
use crate::format::ReadCollection;

use std::io::Read;
use std::marker::PhantomData;

enum State<T> {
    NeedChunk,
    HasBuffer(std::vec::IntoIter<T>),
    Done,
}

pub struct EntryIterator<R: Read, C: Collection> {
    // Inputs
    chunks: ChunkReader<R>,

    // Internals
    state: State<C::Entry>,
    entries_read: usize,
    collection: PhantomData<C>,
}

impl<R: Read, C: Collection> EntryIterator<R, C> {
    pub fn new(
        chunks: ChunkReader<R>,
    ) -> Self {
        EntryIterator {
            chunks,
            state: State::NeedChunk, entries_read: 0, collection: PhantomData,
        }
    }

    /// Number of entries returned so far.
    pub fn entries_read(
        &self,
    ) -> usize {
        self.entries_read
    }

    pub fn chunks(
        &self,
    ) -> &ChunkReader<R> {
        &self.chunks
    }

    /// Stops the iterator and returns the underlying input.
    pub fn into_inner(
        self,
    ) -> R {
        self.chunks.into_inner()
    }

    // Replaces the buffer with the entries of the next chunk.
    //
    // A chunk holding an empty collection ends the iteration even if more
    // frames follow it.
    fn next_collection(
        &mut self,
    ) -> Result<bool, GobyError> {
        let chunk = match self.chunks.next_chunk()? {
            Some(chunk) => chunk,
            None => return Ok(false),
        };

        let collection: C = decode_collection(&chunk.bytes).map_err(|err| {
            GobyError::MalformedRecord { path: self.chunks.path().to_path_buf(), offset: chunk.offset, message: C::NAME, source: err }
        })?;

        if collection.is_empty() {
            log::debug!("Empty {} at offset {}, stopping", C::NAME, chunk.offset);
            return Ok(false)
        }

        self.state = State::HasBuffer(collection.into_entries().into_iter());
        Ok(true)
    }
}

impl<R: Read, C: Collection> Iterator for EntryIterator<R, C> {
    type Item = Result<C::Entry, GobyError>;

    fn next(
        &mut self,
    ) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                State::Done => return None,
                State::HasBuffer(entries) => {
                    if let Some(entry) = entries.next() {
                        self.entries_read += 1;
                        return Some(Ok(entry))
                    }
                    self.state = State::NeedChunk;
                },
                State::NeedChunk => {
                    match self.next_collection() {
                        Ok(true) => (),
                        Ok(false) => {
                            log::debug!("Read {} entries from {}", self.entries_read, self.chunks.path().display());
                            self.state = State::Done;
                            return None
                        },
                        Err(err) => {
                            self.state = State::Done;
                            return Some(Err(err))
                        },
                    }
                },
            }
        }
    }
}

impl<R: Read, C: Collection> std::iter::FusedIterator for EntryIterator<R, C> {}

pub type ReadEntries<R> = EntryIterator<R, ReadCollection>;
pub type AlignmentEntries<R> = EntryIterator<R, AlignmentCollection>;

/// Entries of a chunked file whose schema is known only at runtime.
pub enum Entries<R: Read> {
    Reads(ReadEntries<R>),
    Alignments(AlignmentEntries<R>),
}

impl<R: Read> Entries<R> {
    pub fn new(
        chunks: ChunkReader<R>,
        schema: Schema,
    ) -> Self {
        match schema {
            Schema::Reads => Entries::Reads(EntryIterator::new(chunks)),
            Schema::Alignments => Entries::Alignments(EntryIterator::new(chunks)),
        }
    }

    pub fn schema(
        &self,
    ) -> Schema {
        match self {
            Entries::Reads(_) => Schema::Reads,
            Entries::Alignments(_) => Schema::Alignments,
        }
    }
}

impl<R: Read> Iterator for Entries<R> {
    type Item = Result<Record, GobyError>;

    fn next(
        &mut self,
    ) -> Option<Self::Item> {
        match self {
            Entries::Reads(entries) => entries.next().map(|res| res.map(Record::Read)),
            Entries::Alignments(entries) => entries.next().map(|res| res.map(Record::Alignment)),
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Entries<R> {}
