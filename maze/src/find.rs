use std::{
    collections::VecDeque,
    fmt::Debug,
    hash::Hash,
    ops::{Deref, DerefMut},
};

use serde::Serialize;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable, hashable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Hash + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference is valid
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the traversable neighbors of the provided node.
    /// The order must be the same every time for the same node.
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// An entry on the depth-first stack
#[derive(Debug)]
struct ToVisit<R> {
    point: R,
    from: Option<R>,
}

#[derive(Clone, Copy, Debug)]
pub struct VisitedItem<R> {
    pub from: Option<R>,
}

#[derive(Clone, Copy, Debug)]
pub struct Visited<R>(Option<VisitedItem<R>>);

impl<R> Visited<R> {
    fn with_parent(from: Option<R>) -> Self {
        Visited(Some(VisitedItem { from }))
    }
}

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<R> Deref for Visited<R> {
    type Target = Option<VisitedItem<R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<R> DerefMut for Visited<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Serialize)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
}

impl<R> PathResult<R> {
    /// Number of moves along the path
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }

    pub fn into_path(self) -> Option<PathResult<R>> {
        match self {
            PathFinderState::PathFound(result) => Some(result),
            _ => None,
        }
    }
}

/// A traversal strategy that can be advanced one node at a time
pub trait Search<M: MapTrait> {
    fn step(&mut self, map: &M) -> PathFinderState<M::Reference>;

    fn state(&self) -> &PathFinderState<M::Reference>;

    /// Every node marked as visited so far, in the order they were marked
    fn visited(&self) -> &[M::Reference];

    fn into_visited(self) -> Vec<M::Reference>
    where
        Self: Sized;

    fn finish(mut self, map: &M) -> (PathFinderState<M::Reference>, Vec<M::Reference>)
    where
        Self: Sized,
    {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return (s, self.into_visited()),
            }
        }
    }
}

/// Follow the parent links from the goal back to the node without a parent
fn backtrack<R: NodeReference, S: MapStorage<Visited<R>, Reference = R>>(
    visited: &S,
    goal: R,
) -> Vec<R> {
    let mut path: Vec<R> = Vec::new();
    path.push(goal);

    let mut previous_visit = visited.get(goal);

    loop {
        previous_visit = match previous_visit {
            Visited(Some(VisitedItem { from: None })) => {
                // we found the starting point, we are done
                break;
            }
            Visited(Some(VisitedItem { from: Some(from) })) => {
                path.push(from);
                visited.get(from)
            }
            Visited(None) => {
                panic!("Backtracking lead to a Point that was never visited")
            }
        }
    }

    path.reverse();
    path
}

/// Breadth-first search over a FIFO frontier. Nodes are marked when they are
/// queued, so the first time the goal leaves the queue its path is a shortest one.
#[derive(Debug)]
pub struct BreadthFirst<
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
> {
    start: R,
    goal: R,
    visited: S,
    order: Vec<R>,
    frontier: VecDeque<R>,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > BreadthFirst<R, S, M>
{
    pub fn new(start: R, goal: R, mut visited: S) -> Self {
        *visited.get_mut(start) = Visited::with_parent(None);

        Self {
            start,
            goal,
            visited,
            order: vec![start],
            frontier: VecDeque::from([start]),
            state: PathFinderState::Computing,
            _map: std::marker::PhantomData,
        }
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }

    pub fn get_visited(&self) -> &S {
        &self.visited
    }
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > Search<M> for BreadthFirst<R, S, M>
{
    fn step(&mut self, map: &M) -> PathFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(current) = self.frontier.pop_front() else {
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        };

        if current == self.goal {
            self.state = PathFinderState::PathFound(PathResult {
                path: backtrack(&self.visited, self.goal),
                start: self.start,
                goal: self.goal,
            });
            return self.state.clone();
        }

        for point in map.neighbors_of(current) {
            if self.visited.get(point).is_none() {
                *self.visited.get_mut(point) = Visited::with_parent(Some(current));
                self.order.push(point);
                self.frontier.push_back(point);
            }
        }

        self.state.clone()
    }

    fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    fn visited(&self) -> &[R] {
        &self.order
    }

    fn into_visited(self) -> Vec<R> {
        self.order
    }
}

/// Depth-first search with backtracking over an explicit stack.
///
/// Neighbors are pushed in reverse so they are popped in map order, which
/// reproduces the pre-order of a recursive walk without growing the call stack.
/// A node is marked when it is entered and the walk stops as soon as the goal
/// is entered. The path found is valid but not necessarily the shortest.
#[derive(Debug)]
pub struct DepthFirst<
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
> {
    start: R,
    goal: R,
    visited: S,
    order: Vec<R>,
    visit_list: Vec<ToVisit<R>>,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > DepthFirst<R, S, M>
{
    pub fn new(start: R, goal: R, visited: S) -> Self {
        Self {
            start,
            goal,
            visited,
            order: Vec::new(),
            visit_list: vec![ToVisit {
                point: start,
                from: None,
            }],
            state: PathFinderState::Computing,
            _map: std::marker::PhantomData,
        }
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }

    pub fn get_visited(&self) -> &S {
        &self.visited
    }
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > Search<M> for DepthFirst<R, S, M>
{
    fn step(&mut self, map: &M) -> PathFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(visit) = self.visit_list.pop() else {
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        };

        // stale entry, the node was entered through another branch first
        if self.visited.get(visit.point).is_some() {
            return self.state.clone();
        }

        *self.visited.get_mut(visit.point) = Visited::with_parent(visit.from);
        self.order.push(visit.point);

        if visit.point == self.goal {
            self.state = PathFinderState::PathFound(PathResult {
                path: backtrack(&self.visited, self.goal),
                start: self.start,
                goal: self.goal,
            });
            return self.state.clone();
        }

        let next: Vec<R> = map
            .neighbors_of(visit.point)
            .filter(|point| self.visited.get(*point).is_none())
            .collect();

        for point in next.into_iter().rev() {
            self.visit_list.push(ToVisit {
                point,
                from: Some(visit.point),
            });
        }

        self.state.clone()
    }

    fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    fn visited(&self) -> &[R] {
        &self.order
    }

    fn into_visited(self) -> Vec<R> {
        self.order
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::grid::{Cell, CellStorage, GridMap, Point};

    fn create_basic_map(goal: Point) -> GridMap {
        use Cell::*;
        GridMap::new(
            vec![
                vec![Wall, Wall, Wall, Wall, Wall, Wall, Wall],
                vec![Wall, Open, Wall, Wall, Wall, Open, Wall],
                vec![Wall, Open, Wall, Wall, Wall, Open, Wall],
                vec![Wall, Open, Wall, Open, Open, Open, Wall],
                vec![Wall, Open, Wall, Open, Wall, Wall, Wall],
                vec![Wall, Open, Open, Open, Open, Open, Open],
                vec![Wall, Wall, Wall, Wall, Wall, Wall, Wall],
            ],
            Point::new(1, 1),
            goal,
        )
        .unwrap()
    }

    fn bfs(map: &GridMap) -> BreadthFirst<Point, CellStorage<Visited<Point>>, GridMap> {
        BreadthFirst::new(map.start(), map.goal(), map.create_storage())
    }

    fn dfs(map: &GridMap) -> DepthFirst<Point, CellStorage<Visited<Point>>, GridMap> {
        DepthFirst::new(map.start(), map.goal(), map.create_storage())
    }

    #[test]
    fn test_basic_route() {
        let map = create_basic_map(Point::new(1, 5));

        let (state, visited) = bfs(&map).finish(&map);

        assert!(matches!(
            &state,
            PathFinderState::PathFound(result) if result.steps() == 12
        ));
        assert!(visited.contains(&Point::new(1, 1)));
        assert!(visited.contains(&Point::new(1, 5)));
    }

    #[test]
    fn test_basic_no_route() {
        // the goal is forced open but boxed in by walls
        let map = create_basic_map(Point::new(6, 0));

        let (state, visited) = bfs(&map).finish(&map);
        assert!(matches!(state, PathFinderState::NoPathFound));
        assert!(!visited.contains(&Point::new(6, 0)));

        let (state, _) = dfs(&map).finish(&map);
        assert!(matches!(state, PathFinderState::NoPathFound));
    }

    #[test]
    fn test_dfs_follows_neighbor_order() {
        let map = create_basic_map(Point::new(1, 5));

        let (state, visited) = dfs(&map).finish(&map);

        // down is tried first, so the walk runs down column 1, then up is
        // preferred over right once it reaches column 3
        let path = state.into_path().unwrap().path;
        assert_eq!(path.first(), Some(&Point::new(1, 1)));
        assert_eq!(path.last(), Some(&Point::new(1, 5)));
        assert_eq!(path.len(), 13);
        assert_eq!(
            &visited[..5],
            &[
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(3, 1),
                Point::new(4, 1),
                Point::new(5, 1),
            ]
        );
        // the walk stops at the goal, the rest of the bottom corridor is never entered
        assert!(!visited.contains(&Point::new(5, 4)));
        assert!(!visited.contains(&Point::new(5, 6)));
    }

    #[test]
    fn test_bfs_marks_on_enqueue() {
        use Cell::*;
        let map = GridMap::new(
            vec![vec![Open, Open, Open], vec![Open, Open, Open]],
            Point::new(0, 0),
            Point::new(0, 1),
        )
        .unwrap();

        let (state, visited) = bfs(&map).finish(&map);

        assert_eq!(
            state.into_path().unwrap().path,
            vec![Point::new(0, 0), Point::new(0, 1)]
        );
        // (1, 0) is expanded before the goal leaves the queue, so (1, 1) is marked too
        assert_eq!(
            visited,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(0, 1),
                Point::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_step_after_done_is_stable() {
        let map = create_basic_map(Point::new(1, 5));
        let mut finder = dfs(&map);

        let mut steps = 0;
        while !finder.step(&map).is_done() {
            steps += 1;
        }
        assert!(steps > 0);

        let visited = finder.visited().len();
        let state = finder.state().clone();
        assert_eq!(finder.step(&map), state);
        assert_eq!(finder.visited().len(), visited);
    }

    #[test]
    fn test_finders_search_between_map_endpoints() {
        let map = create_basic_map(Point::new(1, 5));

        let b = bfs(&map);
        let d = dfs(&map);
        assert_eq!((b.start(), b.goal()), (map.start(), map.goal()));
        assert_eq!((d.start(), d.goal()), (map.start(), map.goal()));

        assert!(map.is_valid(Point::new(6, 6)));
        assert!(!map.is_valid(Point::new(7, 0)));
        assert!(!map.is_valid(Point::new(0, 7)));
    }

    #[test]
    fn test_start_has_no_parent() {
        let map = create_basic_map(Point::new(1, 5));
        let mut finder = bfs(&map);
        finder.step(&map);

        assert!(matches!(
            finder.get_visited().get(map.start()),
            Visited(Some(VisitedItem { from: None }))
        ));
        assert!(matches!(
            finder.get_visited().get(Point::new(2, 1)),
            Visited(Some(VisitedItem { from: Some(p) })) if p == map.start()
        ));
    }
}
