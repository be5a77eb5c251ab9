use crate::error::{Result, TypeError};
use crate::resolver::Resolver;
use crate::{Type, TypeVarId, WildcardType};

impl<'env> Resolver<'env> {
    /// Declared bounds of `var`, or `[Object]` when none are declared.
    pub fn implicit_bounds(&self, var: TypeVarId) -> Result<Vec<Type>> {
        let def = self.type_param_def(var)?;
        Ok(self.or_object(&def.upper_bounds))
    }

    /// Upper bounds of `wildcard`, or `[Object]` when none are declared.
    pub fn implicit_upper_bounds(&self, wildcard: &WildcardType) -> Vec<Type> {
        self.or_object(&wildcard.upper_bounds)
    }

    /// Lower bounds of `wildcard`. `[None]` stands for "no lower bound", which is not the same
    /// thing as a bottom type: nothing but an absent source is assignable to it.
    pub fn implicit_lower_bounds(&self, wildcard: &WildcardType) -> Vec<Option<Type>> {
        if wildcard.lower_bounds.is_empty() {
            return vec![None];
        }
        wildcard.lower_bounds.iter().cloned().map(Some).collect()
    }

    /// Drop every bound that is implied by another bound in the list.
    ///
    /// A bound `B` is dropped when some other bound `C` is assignable to `B`. When two bounds are
    /// mutually assignable the earlier one is kept. Order of the survivors is preserved.
    pub fn normalize_upper_bounds(&self, bounds: &[Type]) -> Result<Vec<Type>> {
        if bounds.is_empty() {
            return Err(TypeError::EmptyBounds);
        }

        let mut unique: Vec<&Type> = Vec::with_capacity(bounds.len());
        for bound in bounds {
            if !unique.contains(&bound) {
                unique.push(bound);
            }
        }
        if unique.len() == 1 {
            return Ok(vec![unique[0].clone()]);
        }

        let mut out = Vec::with_capacity(unique.len());
        'bounds: for (i, &bound) in unique.iter().enumerate() {
            for (j, &other) in unique.iter().enumerate() {
                if i == j || !self.is_assignable(Some(other), bound, None)? {
                    continue;
                }
                // Mutual assignability: keep whichever came first.
                if j > i && self.is_assignable(Some(bound), other, None)? {
                    continue;
                }
                continue 'bounds;
            }
            out.push(bound.clone());
        }

        if out.is_empty() {
            out.push(unique[0].clone());
        }
        Ok(out)
    }

    fn or_object(&self, bounds: &[Type]) -> Vec<Type> {
        if bounds.is_empty() {
            vec![Type::Class(self.env().well_known().object)]
        } else {
            bounds.to_vec()
        }
    }
}
