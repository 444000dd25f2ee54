use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::Bfs,
};

use crate::{
    automaton::{Cell, Fa, TRAP},
    error::FaError,
};

impl Fa {
    /// Hopcroft minimization with an accessibility pre-pass.
    ///
    /// The input must have no epsilon column and no transition sets.
    /// Missing edges are tolerated: they are routed into a synthetic trap
    /// for the refinement and stripped from the result again, so a total
    /// input yields a total output with at most as many states.
    pub fn minimize(&self) -> Result<Fa, FaError> {
        if self.epsilon_index().is_some() {
            return Err(FaError::InvalidAutomaton(
                "cannot minimize an automaton with epsilon transitions".to_string(),
            ));
        }

        let accessible = self.accessible()?;

        let n = accessible.states.len();
        let k = accessible.alphabet.len();

        // resolve every cell to a state index; the synthetic trap at index
        // `n` absorbs undefined moves and loops on itself
        let trap = n;
        let mut delta = vec![vec![trap; k]; n + 1];
        let mut uses_trap = false;

        for i in 0..n {
            for j in 0..k {
                match accessible.cell(i, j) {
                    Cell::Void => uses_trap = true,
                    Cell::Trap => match accessible.state_index(TRAP) {
                        Some(t) => delta[i][j] = t,
                        None => uses_trap = true,
                    },
                    Cell::To(name) => delta[i][j] = accessible.require_state(name)?,
                    Cell::ToMany(_) => {
                        return Err(FaError::InvalidAutomaton(
                            "cannot minimize a non-deterministic automaton".to_string(),
                        ))
                    }
                }
            }
        }

        let m = if uses_trap { n + 1 } else { n };
        let accepting: Vec<bool> = (0..m)
            .map(|i| i < n && accessible.is_accepting(&accessible.states[i]))
            .collect();

        let (blocks, block_of) = refine(&delta, &accepting, m, k);

        // deterministic block enumeration: by smallest member
        let mut order: Vec<usize> = (0..blocks.len()).collect();
        order.sort_by_key(|&b| blocks[b].iter().copied().min().unwrap_or(usize::MAX));

        let synthetic = if uses_trap { Some(trap) } else { None };

        let mut block_names: HashMap<usize, String> = HashMap::new();
        let mut kept: Vec<usize> = Vec::new();
        for &b in &order {
            if blocks[b].iter().all(|&s| Some(s) == synthetic) {
                continue;
            }
            block_names.insert(b, format!("q{}", kept.len()));
            kept.push(b);
        }

        let mut states = Vec::with_capacity(kept.len());
        let mut acceptance = Vec::new();
        let mut transitions = Vec::with_capacity(kept.len());

        for &b in &kept {
            let Some(representative) = blocks[b]
                .iter()
                .copied()
                .filter(|&s| Some(s) != synthetic)
                .min()
            else {
                continue;
            };

            let name = block_names[&b].clone();
            if accepting[representative] {
                acceptance.push(name.clone());
            }

            let mut row = Vec::with_capacity(k);
            for j in 0..k {
                let target_block = block_of[delta[representative][j]];
                match block_names.get(&target_block) {
                    Some(target) => row.push(Cell::To(target.clone())),
                    // edges into the synthetic trap block revert to `@v`
                    None => row.push(Cell::Void),
                }
            }

            states.push(name);
            transitions.push(row);
        }

        let initial_index = accessible.require_state(&accessible.initial)?;
        let initial = block_names
            .get(&block_of[initial_index])
            .cloned()
            .ok_or_else(|| FaError::NotFound("initial state has no block".to_string()))?;

        Ok(Fa {
            alphabet: accessible.alphabet,
            states,
            initial,
            acceptance,
            transitions,
        })
    }

    /// Restriction to the states reachable from `initial` by a forward BFS
    /// over the transition structure. Cell references that do not survive
    /// the filter are rewritten to `@v`.
    fn accessible(&self) -> Result<Fa, FaError> {
        let initial = self.require_state(&self.initial)?;

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.states.len()).map(|i| graph.add_node(i)).collect();

        for i in 0..self.states.len() {
            for j in 0..self.alphabet.len() {
                for target in self.cell(i, j).targets() {
                    if let Some(t) = self.state_index(target) {
                        graph.add_edge(nodes[i], nodes[t], ());
                    }
                }
            }
        }

        let mut reached: HashSet<usize> = HashSet::new();
        let mut bfs = Bfs::new(&graph, nodes[initial]);
        while let Some(node) = bfs.next(&graph) {
            reached.insert(graph[node]);
        }

        let keep: Vec<usize> = (0..self.states.len())
            .filter(|i| reached.contains(i))
            .collect();
        let kept_names: HashSet<&str> = keep.iter().map(|&i| self.states[i].as_str()).collect();

        let transitions = keep
            .iter()
            .map(|&i| {
                (0..self.alphabet.len())
                    .map(|j| {
                        let cell = self.cell(i, j);
                        match cell {
                            Cell::Void | Cell::Trap => cell.clone(),
                            _ => Cell::normalize(
                                cell.targets()
                                    .filter(|t| kept_names.contains(t))
                                    .map(str::to_string),
                            ),
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Fa {
            alphabet: self.alphabet.clone(),
            states: keep.iter().map(|&i| self.states[i].clone()).collect(),
            initial: self.initial.clone(),
            acceptance: self
                .acceptance
                .iter()
                .filter(|a| kept_names.contains(a.as_str()))
                .cloned()
                .collect(),
            transitions,
        })
    }
}

/// Hopcroft partition refinement over a total transition table.
///
/// Starts from the accepting/non-accepting split and repeatedly splits
/// blocks against the predecessors of a splitter block. A block that is
/// still queued is replaced by both halves; otherwise only the smaller half
/// is enqueued. Returns the final blocks and the block id of every state.
fn refine(
    delta: &[Vec<usize>],
    accepting: &[bool],
    m: usize,
    k: usize,
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let mut blocks: Vec<Vec<usize>> = Vec::new();
    let mut block_of: Vec<usize> = vec![0; m];

    let non_accepting: Vec<usize> = (0..m).filter(|&s| !accepting[s]).collect();
    let accepting_states: Vec<usize> = (0..m).filter(|&s| accepting[s]).collect();
    for block in [non_accepting, accepting_states] {
        if !block.is_empty() {
            for &s in &block {
                block_of[s] = blocks.len();
            }
            blocks.push(block);
        }
    }

    // predecessors per symbol: preds[j][t] = { s | delta[s][j] == t }
    let mut preds: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); m]; k];
    for s in 0..m {
        for j in 0..k {
            preds[j][delta[s][j]].push(s);
        }
    }

    let mut worklist: VecDeque<usize> = (0..blocks.len()).collect();
    let mut queued: Vec<bool> = vec![true; blocks.len()];

    while let Some(splitter) = worklist.pop_front() {
        queued[splitter] = false;
        let splitter_states: Vec<usize> = blocks[splitter].clone();

        for j in 0..k {
            let mut hits: HashMap<usize, Vec<usize>> = HashMap::new();
            for &target in &splitter_states {
                for &p in &preds[j][target] {
                    hits.entry(block_of[p]).or_default().push(p);
                }
            }

            let mut split_candidates: Vec<usize> = hits.keys().copied().collect();
            split_candidates.sort_unstable();

            for block in split_candidates {
                let mut inside = hits.remove(&block).unwrap_or_default();
                inside.sort_unstable();
                inside.dedup();
                if inside.len() == blocks[block].len() {
                    continue;
                }

                let inside_set: HashSet<usize> = inside.iter().copied().collect();
                let outside: Vec<usize> = blocks[block]
                    .iter()
                    .copied()
                    .filter(|s| !inside_set.contains(s))
                    .collect();

                let new_block = blocks.len();
                blocks[block] = inside;
                blocks.push(outside);
                for &s in &blocks[new_block] {
                    block_of[s] = new_block;
                }
                queued.push(false);

                if queued[block] {
                    worklist.push_back(new_block);
                    queued[new_block] = true;
                } else {
                    let smaller = if blocks[block].len() <= blocks[new_block].len() {
                        block
                    } else {
                        new_block
                    };
                    worklist.push_back(smaller);
                    queued[smaller] = true;
                }
            }
        }
    }

    (blocks, block_of)
}
