use crate::alias::resolve_alias;
use crate::error::{Result, SpecError};
use crate::spec::DataSpec;
use crate::store::AliasStore;

pub const DEFAULT_ALIAS_PREFIX: &str = "@";

/// A raw argument, classified once: an alias reference or a literal address
/// fragment.
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Alias(&'a str),
    Literal(&'a str),
}

/// Turns 0-2 raw command-line tokens into a single resolved address.
///
/// Arguments starting with the alias prefix are expanded against the store;
/// a bare first argument is a workbook ID and a bare second argument is a
/// "worksheet" or "worksheet!range" fragment. The expanded partial addresses
/// are merged; specifying the same field twice is an error.
pub struct Resolver<'a> {
    store: &'a dyn AliasStore,
    prefix: String,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn AliasStore, prefix: &str) -> Self {
        let prefix = if prefix.is_empty() {
            DEFAULT_ALIAS_PREFIX
        } else {
            prefix
        };
        Resolver {
            store,
            prefix: prefix.to_string(),
        }
    }

    fn classify<'s>(&self, arg: &'s str) -> Token<'s> {
        match arg.strip_prefix(self.prefix.as_str()) {
            Some(name) => Token::Alias(name),
            None => Token::Literal(arg),
        }
    }

    pub fn resolve(&self, args: &[String]) -> Result<DataSpec> {
        // Argument count is a structural precondition; it is checked before
        // any alias lookup.
        if args.len() > 2 {
            return Err(SpecError::TooManyArgs(args.to_vec()));
        }

        if args.is_empty() {
            return Ok(DataSpec::default());
        }

        let tokens: Vec<Token> = args.iter().map(|arg| self.classify(arg)).collect();

        if tokens.len() == 1 {
            return match tokens[0] {
                Token::Alias(name) => resolve_alias(self.store, name),
                // A single non-alias argument is always a workbook ID.
                Token::Literal(arg) => Ok(DataSpec::for_workbook(arg)),
            };
        }

        // Two arguments: each may be an alias or a literal. Expand each into
        // a partial address and merge; the partials cannot overlap.
        let mut specs = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let spec = match token {
                Token::Alias(name) => resolve_alias(self.store, name)?,
                Token::Literal(arg) => {
                    if i == 0 {
                        DataSpec::for_workbook(arg)
                    } else {
                        DataSpec::parse_worksheet_fragment(arg)?
                    }
                }
            };
            specs.push(spec);
        }
        let merged = merge_specs(&specs)?;

        // A bare "!range" fragment can slip a range in without a worksheet;
        // such an address cannot leave the resolver.
        if !merged.range.is_empty() && merged.worksheet.is_empty() {
            return Err(SpecError::RangeWithoutWorksheet(merged.range.to_string()));
        }
        Ok(merged)
    }
}

/// Merge partial addresses into one. A field set by more than one partial is
/// a conflict, even if the values agree.
fn merge_specs(specs: &[DataSpec]) -> Result<DataSpec> {
    let mut ret = DataSpec::default();
    for spec in specs {
        if !spec.workbook.is_empty() {
            if !ret.workbook.is_empty() {
                return Err(SpecError::FieldConflict("workbook"));
            }
            ret.workbook = spec.workbook.clone();
        }
        if !spec.worksheet.is_empty() {
            if !ret.worksheet.is_empty() {
                return Err(SpecError::FieldConflict("worksheet"));
            }
            ret.worksheet = spec.worksheet.clone();
        }
        if !spec.range.is_empty() {
            if !ret.range.is_empty() {
                return Err(SpecError::FieldConflict("range"));
            }
            ret.range = spec.range;
        }
    }
    Ok(ret)
}
