//! Batch renaming of source files by identifier.
//!
//! A mapping CSV lists `old,new` identifier pairs. Each target's identifier is
//! derived with the same rules used for building manifests, and only that part
//! of the file name is replaced:
//!
//! ```text
//! GCF_000005845.2_ASM584v2_genomic.fna  --(prefix, GCF_000005845.2 -> ecoli_k12)-->
//! ecoli_k12_ASM584v2_genomic.fna
//! ```
//!
//! Collisions are detected for the whole batch before any file is moved.

pub mod batch;
